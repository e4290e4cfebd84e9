//! Embassy async tasks
//!
//! Each task runs independently and communicates through `channels`.

pub mod chime;
pub mod clock_face;
pub mod encoder;
pub mod link_rx;
pub mod link_tx;
pub mod shutdown;
pub mod speed_control;

pub use chime::chime_task;
pub use clock_face::clock_face_task;
pub use encoder::encoder_task;
pub use link_rx::link_rx_task;
pub use link_tx::link_tx_task;
pub use shutdown::shutdown_task;
pub use speed_control::speed_control_task;
