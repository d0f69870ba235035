mod card_tests;
mod render_tests;
