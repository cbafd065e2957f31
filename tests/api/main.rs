mod best_effort_steps;
mod helpers;
