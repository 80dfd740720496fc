pub mod intake;
pub mod record_list;
pub mod search_bar;
