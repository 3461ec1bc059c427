pub mod home;
pub mod production;
pub mod project;
pub mod residues;
