mod common;
mod fetcher_tests;
mod llm_tests;
mod remote_tests;
