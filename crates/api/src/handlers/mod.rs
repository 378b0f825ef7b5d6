pub mod superhero;
