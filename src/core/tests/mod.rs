mod event_scheduler_tests;
mod model_tests;
