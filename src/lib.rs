// ShellEdit - 本地 / 远程文件编辑器

pub mod cli;
pub mod components;
pub mod editor;
pub mod i18n;
pub mod keybindings;
pub mod models;
pub mod pages;
pub mod services;
pub mod ssh;
pub mod theme;
