use crate::models::NewMovie;

pub const ADMIN_USERNAME: &str = "admin";

/// Catalog provisioned into an empty store, oldest first.
pub fn sample_movies() -> Vec<NewMovie> {
    vec![
        NewMovie {
            title: "El Padrino".to_string(),
            synopsis: "La historia de la familia Corleone, una de las más poderosas familias de la mafia italiana en Nueva York después de la Segunda Guerra Mundial.".to_string(),
            release_date: "2023-10-15".to_string(),
            genre: "drama".to_string(),
            duration: "175".to_string(),
            director: "Francis Ford Coppola".to_string(),
            cast: "Marlon Brando, Al Pacino, James Caan".to_string(),
            poster_url: "https://images.unsplash.com/photo-1536440136628-849c177e76a1?ixlib=rb-4.0.3&auto=format&fit=crop&w=1625&q=80".to_string(),
            trailer_url: "https://www.youtube.com/watch?v=sY1S34973zA".to_string(),
        },
        NewMovie {
            title: "Interestelar".to_string(),
            synopsis: "Un grupo de exploradores espaciales viaja a través de un agujero de gusano en busca de un nuevo hogar para la humanidad.".to_string(),
            release_date: "2023-10-20".to_string(),
            genre: "ciencia-ficcion".to_string(),
            duration: "169".to_string(),
            director: "Christopher Nolan".to_string(),
            cast: "Matthew McConaughey, Anne Hathaway, Jessica Chastain".to_string(),
            poster_url: "https://images.unsplash.com/photo-1534447677768-be436bb09401?ixlib=rb-4.0.3&auto=format&fit=crop&w=1000&q=80".to_string(),
            trailer_url: "https://www.youtube.com/watch?v=zSWdZVtXT7E".to_string(),
        },
    ]
}
