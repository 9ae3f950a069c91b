mod test_authentication;
mod test_disconnect_announces_departure;
