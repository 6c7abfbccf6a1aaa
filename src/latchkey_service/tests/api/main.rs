mod helpers;
mod login;
mod register_complete;
mod register_initial;
mod registration_flow;
