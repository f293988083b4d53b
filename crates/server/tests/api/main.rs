mod helpers;

mod advice;
mod health;
mod historical;
mod predict;
mod series;
