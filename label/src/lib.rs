//! Label types and encoders for the spaceship localization task.
//!
//! A rendered scene is described by a [RawLabel]. The label goes through three
//! stages before it reaches a training batch:
//!
//! 1. [encode_angles] adds the wrap-safe `sin` and `cos` representation of yaw.
//! 2. [encode_presence] adds the `detection` flag derived from the missing-value
//!    sentinel.
//! 3. [RangeNormalizer] maps every variable into `[-1, 1]` using a [DomainTable].

mod common;

pub mod angle;
pub mod domain;
pub mod error;
pub mod labels;
pub mod normalize;
pub mod prediction;
pub mod presence;
pub mod variable;

pub use angle::*;
pub use domain::*;
pub use error::*;
pub use labels::*;
pub use normalize::*;
pub use prediction::*;
pub use presence::*;
pub use variable::*;
