pub mod console;
pub mod random;
pub mod scripted;

pub use console::ConsolePlayer;
pub use random::RandomAi;
pub use scripted::ScriptedPlayer;
