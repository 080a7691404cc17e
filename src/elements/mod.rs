//! Degrees of freedom and connecting elements of the shear-chain model

mod dof;
mod element;

pub use dof::{DegreeOfFreedom, DofKind};
pub use element::{Element, ElementEnd, ElementKind};
