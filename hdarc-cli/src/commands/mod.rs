//! Command implementations for the hdarc CLI.

pub mod decompress;
pub mod fix_lba;
pub mod list;
pub mod pack;
pub mod test;
pub mod unpack;

pub use decompress::cmd_decompress;
pub use fix_lba::{FixLbaOptions, cmd_fix_lba};
pub use list::{ListOptions, cmd_list};
pub use pack::cmd_pack;
pub use test::cmd_test;
pub use unpack::{UnpackOptions, cmd_unpack};
