/// The move package and its cli steps
pub mod move_package;

pub use move_package::{MovePackage, PackageManifest};
