pub(crate) mod battery;
pub(crate) mod display;
pub(crate) mod vibration;
