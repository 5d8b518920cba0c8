//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs):
//!     Resolve config → Init logging/metrics → Open session store → Start monitor
//!
//! Console (console.rs):
//!     stdin line → ConsoleCommand → dismiss / status / quit
//!
//! Shutdown (signals.rs):
//!     SIGTERM/SIGINT or `q` → stop monitor (cancels timers) → Exit
//! ```

pub mod console;
pub mod signals;

pub use console::ConsoleCommand;
