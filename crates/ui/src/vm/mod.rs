mod menu_vm;
mod status_vm;

pub use menu_vm::{MenuAction, MenuEntryVm, MenuVm, map_menu};
pub use status_vm::{StatusTileVm, map_status_tiles, sos_notice};
