pub mod constants;
pub mod observer;
pub mod remote;
pub mod request;
pub mod utils;
pub mod wire;
