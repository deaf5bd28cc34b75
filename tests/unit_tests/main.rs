mod application;
mod support;
