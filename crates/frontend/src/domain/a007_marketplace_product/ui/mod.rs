pub mod characteristics;
