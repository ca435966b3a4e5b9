// TUI widget modules for each portal panel.

pub mod alert;
pub mod commission_info;
pub mod empty_state;
pub mod results_table;
pub mod search_form;
pub mod selectors;
pub mod stats_card;
pub mod status_bar;
