mod aliases_test;
mod test_mocks;
