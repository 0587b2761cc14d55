//! Artifact validators (schema inventory, protobuf files, SHACL shapes).

pub mod inventory;
pub mod protobuf;
pub mod shacl;
