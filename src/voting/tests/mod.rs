mod binary_service_tests;
mod session_service_tests;
