pub mod events;
pub mod handler;

// Re-export the essential types
pub use events::{InputEvent, KeyCode, MapEvent};
pub use handler::{Action, DragState, EventManager, InputHandler, Subscription};
