pub mod episode_list;
pub mod help_overlay;
pub mod now_playing;
