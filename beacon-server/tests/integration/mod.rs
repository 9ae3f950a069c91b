pub mod connection_tests;
pub mod messaging_tests;
pub mod multi_peer_tests;
