pub mod controller;
pub mod generate;
pub mod history;
pub mod input;
pub mod shortcuts;
pub mod text;

pub use controller::{AnnotationController, LoadTicket};
pub use history::HistoryManager;
pub use text::{TextCommit, TextStore};
