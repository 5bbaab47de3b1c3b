mod match_end_tests;
