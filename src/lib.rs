//! Drivers for the helm instrument pod: a BNO055 absolute-orientation
//! sensor on i2c and a MAX7219 8x8 dot-matrix display on a bit-banged
//! three-wire bus.

pub mod peripheral;
pub mod types;
