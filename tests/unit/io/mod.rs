mod cli;
mod configuration;
mod document;
mod image;
