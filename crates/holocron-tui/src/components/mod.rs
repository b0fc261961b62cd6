pub mod character_card;
pub mod character_detail;
pub mod character_list;
pub mod favourites_list;
pub mod header;
pub mod help_overlay;
