pub mod appstate;
pub mod attribute;
pub mod event;
pub mod operation;
pub mod package;
pub mod reason;
pub mod tab;
pub mod timedstring;
