//! Embassy async tasks
//!
//! Each task runs independently and communicates through `channels`.

pub mod display;
pub mod link_rx;
pub mod link_tx;
pub mod rotation;
pub mod shutdown;

pub use display::display_task;
pub use link_rx::link_rx_task;
pub use link_tx::link_tx_task;
pub use rotation::rotation_task;
pub use shutdown::shutdown_task;
