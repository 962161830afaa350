//! 스팟 가격 파이프라인 도메인 모델.

pub mod partition;
pub mod price;
pub mod region;
pub mod statistics;
pub mod window;

pub use partition::*;
pub use price::*;
pub use region::*;
pub use statistics::*;
pub use window::*;
