mod test_dead_target_drop;
mod test_malformed_message;
