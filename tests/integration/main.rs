
mod auth;
mod blogs;
mod counters;
