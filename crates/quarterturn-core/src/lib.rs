//! Quarterturn Core - exact quarter-turn image rotation
//!
//! This crate provides the synchronous image domain for Quarterturn: angle
//! normalization, exact 0/90/180/270-degree rotation by coordinate
//! remapping, and byte-level decoding/encoding of source images. It performs
//! no I/O beyond in-memory buffers; the asynchronous orchestration lives in
//! `quarterturn-service`.

pub mod angle;
pub mod decode;
pub mod encode;
pub mod raster;
pub mod rotate;

pub use angle::{normalize, AngleError, RotationStep};
pub use decode::{decode_image, DecodeError};
pub use encode::{encode_png, encode_raster, EncodeError};
pub use raster::Raster;
pub use rotate::{rotate, rotated_dimensions};
