mod test_concurrent_joins;
mod test_fan_out_resilience;
