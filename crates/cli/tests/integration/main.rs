mod add_tests;
mod common;
mod init_tests;
mod inspect_tests;
mod update_tests;
