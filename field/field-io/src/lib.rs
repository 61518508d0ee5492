//! Mesh file I/O for the fieldbox simulator.
//!
//! Only the Wavefront OBJ subset the simulator consumes is supported:
//! `v` vertex lines and `f` face lines (position index only; texture and
//! normal indices after a `/` are ignored). Faces with more than three
//! vertices are fan-triangulated. Everything else in the file is skipped.
//!
//! # Example
//!
//! ```no_run
//! use field_io::load_obj;
//!
//! let mesh = load_obj("data/bunny.obj").unwrap();
//! println!("loaded {} triangles", mesh.face_count());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod error;
mod obj;

pub use error::{IoError, IoResult};
pub use obj::{load_obj, parse_obj};
