// Generation passes, numbered in the order a full run applies them.
//
// Passes 1 to 4 make up a complete run. The binary and test appenders are
// optional follow-ups that add rules to BUILD files written by pass 3.

#[path = "01_module.rs"]
pub mod module;
#[path = "02_meta.rs"]
pub mod meta;
#[path = "03_build.rs"]
pub mod build;
#[path = "04_workspace.rs"]
pub mod workspace;
#[path = "05_binary.rs"]
pub mod binary;
#[path = "06_test.rs"]
pub mod test;
