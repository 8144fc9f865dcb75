mod payment_service_tests;
