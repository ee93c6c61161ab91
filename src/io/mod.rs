pub mod config_io;
pub mod debounce;
pub mod lock;
pub mod recovery;
pub mod storage;
