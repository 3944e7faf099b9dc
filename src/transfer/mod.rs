//! Platform I/O used by the editor: file export, file import and the clipboard.
//!
//! The editor only talks to these traits, so a front end can plug in a
//! browser download, a native save dialog or plain files.
mod clipboard;
mod file;

pub use clipboard::{Clipboard, ClipboardClearer, MemoryClipboard};
pub use file::{DirectorySink, FileSink, FileSource, PathSource};
