//! Icon definitions, resolved against `config::ICON_THEME`.

use icondata::Icon;

use crate::config::IconTheme;

mod lucide {
    pub use icondata::{
        LuAArrowDown as FontDecrease, LuAArrowUp as FontIncrease, LuBellDot as NewUpdates,
        LuBookOpen as FilePdf, LuChevronDown as ChevronDown, LuChevronLeft as ChevronLeft,
        LuChevronRight as ChevronRight, LuClock as Clock, LuFileText as FileText,
        LuFolder as Folder, LuFolderOpen as FolderOpen, LuMaximize2 as Immersive,
        LuMegaphone as Announcements, LuSearch as Search, LuSend as Send, LuX as Close,
    };
}

mod bootstrap {
    pub use icondata::{
        BsArrowsFullscreen as Immersive, BsBellFill as NewUpdates, BsChevronDown as ChevronDown,
        BsChevronLeft as ChevronLeft, BsChevronRight as ChevronRight, BsClock as Clock,
        BsDashLg as FontDecrease, BsFileEarmarkPdf as FilePdf, BsFileEarmarkText as FileText,
        BsFolder2Open as FolderOpen, BsFolderFill as Folder, BsMegaphone as Announcements,
        BsPlusLg as FontIncrease, BsSearch as Search, BsSend as Send, BsXLg as Close,
    };
}

macro_rules! themed_icon {
    ($name:ident, $theme_name:ident) => {
        pub const $name: Icon = match crate::config::ICON_THEME {
            IconTheme::Lucide => lucide::$theme_name,
            IconTheme::Bootstrap => bootstrap::$theme_name,
        };
    };
}

themed_icon!(ANNOUNCEMENTS, Announcements);
themed_icon!(CHEVRON_DOWN, ChevronDown);
themed_icon!(CHEVRON_LEFT, ChevronLeft);
themed_icon!(CHEVRON_RIGHT, ChevronRight);
themed_icon!(CLOCK, Clock);
themed_icon!(CLOSE, Close);
themed_icon!(FILE_PDF, FilePdf);
themed_icon!(FILE_TEXT, FileText);
themed_icon!(FOLDER, Folder);
themed_icon!(FOLDER_OPEN, FolderOpen);
themed_icon!(FONT_DECREASE, FontDecrease);
themed_icon!(FONT_INCREASE, FontIncrease);
themed_icon!(IMMERSIVE, Immersive);
themed_icon!(NEW_UPDATES, NewUpdates);
themed_icon!(SEARCH, Search);
themed_icon!(SEND, Send);
