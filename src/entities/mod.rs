pub mod pelicula;
pub mod usuario;
