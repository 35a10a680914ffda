//! Server-rendered catalog page.
//!
//! The page is a read-only snapshot of the catalog view: filters and the
//! detail modal are plain links, while the admin panel and login form are
//! markup only. Logging in and editing go through `/api`, for example with
//! [`crate::frontend::CatalogApp`].

use hypertext::prelude::*;

use crate::frontend::view::{ALL_GENRES, CatalogView, MovieDetail};

const FONT_AWESOME_CDN: &str =
    "https://cdnjs.cloudflare.com/ajax/libs/font-awesome/6.4.0/css/all.min.css";

/// Single-page frontend document: catalog, optional detail modal, admin panel.
pub fn index_page(view: &CatalogView, genres: &[String], detail: Option<&MovieDetail>) -> String {
    let body = maud! {
        html lang="es" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { "Cine Universidad" }
                link rel="stylesheet" href=(FONT_AWESOME_CDN);
            }
            body {
                header {
                    nav {
                        a class="logo" href="/" { "Cine Universidad" }
                        a id="admin-link" href="#admin-panel" {
                            @if view.is_admin { "Panel Admin" } @else { "Admin" }
                        }
                    }
                }
                main {
                    section id="cartelera" {
                        h2 { "Cartelera" }
                        div class="filtros" {
                            a class=(filter_class(&view.filter, ALL_GENRES)) href="/" data-genero=(ALL_GENRES) { "Todos" }
                            @for genre in genres {
                                a class=(filter_class(&view.filter, genre)) href=(format!("/?genero={}", urlencoding::encode(genre))) data-genero=(genre) { (genre) }
                            }
                        }
                        div id="peliculas-container" {
                            @if view.is_empty() {
                                div class="no-results" { "No hay películas disponibles." }
                            }
                            @for card in &view.cards {
                                div class="pelicula-card" data-id=(card.id.to_string()) data-genero=(card.genre) {
                                    img class="pelicula-img" src=(card.poster_url) alt=(card.title);
                                    div class="pelicula-info" {
                                        div class="pelicula-header" {
                                            h3 class="pelicula-titulo" { (card.title) }
                                            span class="pelicula-genero" { (card.genre) }
                                        }
                                        div class="pelicula-meta" {
                                            span class="meta-item" { (card.duration) " min" }
                                            span class="meta-item" { (card.release_date) }
                                            span class="meta-item" { (card.director) }
                                        }
                                        p class="pelicula-sinopsis" { (card.synopsis) }
                                        div class="pelicula-actions" {
                                            a class="btn-primary ver-detalles" href=(format!("/?pelicula={}", card.id)) { "Ver Detalles" }
                                            @if card.can_edit {
                                                button class="btn-secondary editar-pelicula" type="button" data-id=(card.id.to_string()) { "Editar" }
                                            }
                                        }
                                    }
                                }
                            }
                        }
                    }

                    @if let Some(detail) = detail {
                        div id="pelicula-modal" class="modal abierto" {
                            div class="modal-content" {
                                a class="close-modal" href="/" { "×" }
                                div class="modal-pelicula" {
                                    div class="modal-header" {
                                        h2 { (detail.title) }
                                        div class="modal-meta" {
                                            span { (detail.release_date) }
                                            span { (detail.duration) " minutos" }
                                            span class="genero-badge" { (detail.genre) }
                                        }
                                    }
                                    div class="modal-content-grid" {
                                        div class="modal-img-container" {
                                            img class="modal-img" src=(detail.poster_url) alt=(detail.title);
                                        }
                                        div class="modal-details" {
                                            div class="modal-section" {
                                                h3 { "Sinopsis" }
                                                p { (detail.synopsis) }
                                            }
                                            div class="modal-info-grid" {
                                                div class="info-card" {
                                                    h4 { "Director" }
                                                    p { (detail.director) }
                                                }
                                                div class="info-card" {
                                                    h4 { "Actores" }
                                                    p { (detail.cast) }
                                                }
                                            }
                                            @if let Some(embed) = &detail.trailer_embed_url {
                                                div class="modal-section" {
                                                    h3 { "Trailer" }
                                                    div class="trailer-container" {
                                                        iframe width="100%" height="315" src=(embed) title="Trailer" allow="autoplay; encrypted-media; picture-in-picture; fullscreen" {}
                                                    }
                                                }
                                            }
                                        }
                                    }
                                    @if detail.show_admin_actions {
                                        div class="modal-actions" {
                                            button class="btn-primary editar-pelicula-modal" type="button" data-id=(detail.id.to_string()) { "Editar Película" }
                                            button class="btn-danger eliminar-pelicula-modal" type="button" data-id=(detail.id.to_string()) { "Eliminar Película" }
                                        }
                                    }
                                }
                            }
                        }
                    }

                    section id="admin-panel" {
                        h2 { "Administración" }
                        @if let Some(rows) = &view.admin_rows {
                            div id="admin-management" {
                                button id="logout-btn" class="btn-secondary" type="button" { "Cerrar sesión" }
                                button id="add-pelicula-btn" class="btn-primary" type="button" { "Agregar Película" }
                                div id="admin-peliculas-container" {
                                    @if rows.is_empty() {
                                        p class="no-data" { "No hay películas para mostrar." }
                                    }
                                    @for row in rows {
                                        div class="admin-pelicula-item" {
                                            div class="admin-pelicula-info" {
                                                div class="admin-pelicula-header" {
                                                    h4 { (row.title) }
                                                    span class="admin-pelicula-id" { "ID: " (row.id.to_string()) }
                                                }
                                                div class="admin-pelicula-details" {
                                                    p { strong { "Fecha: " } (row.release_date) }
                                                    p { strong { "Género: " } (row.genre) }
                                                    p { strong { "Duración: " } (row.duration) " min" }
                                                }
                                            }
                                            div class="admin-pelicula-actions" {
                                                button class="btn-secondary editar-admin" type="button" data-id=(row.id.to_string()) { "Editar" }
                                                button class="btn-danger eliminar-admin" type="button" data-id=(row.id.to_string()) { "Eliminar" }
                                            }
                                        }
                                    }
                                }
                            }
                        } @else {
                            div id="admin-login" {
                                form id="login-form" {
                                    label for="username" { "Usuario" }
                                    input type="text" id="username" name="username" required;
                                    label for="password" { "Contraseña" }
                                    input type="password" id="password" name="password" required;
                                    button class="btn-primary" type="submit" { "Iniciar sesión" }
                                }
                            }
                        }
                    }
                }
                footer {
                    p { "Cine Universidad" }
                }
            }
        }
    }
    .render()
    .into_inner();

    format!("<!DOCTYPE html>{body}")
}

fn filter_class(current: &str, genre: &str) -> &'static str {
    if current.eq_ignore_ascii_case(genre) { "filtro-btn active" } else { "filtro-btn" }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{frontend::view::CatalogViewModel, models::Movie};

    fn movie(id: i64, genre: &str, trailer: &str) -> Movie {
        Movie {
            id,
            title: format!("Película <{id}>"),
            synopsis: "Sinopsis".into(),
            release_date: "2023-10-15".into(),
            genre: genre.into(),
            duration: "120".into(),
            director: "D".into(),
            cast: "C".into(),
            poster_url: "https://img".into(),
            trailer_url: trailer.into(),
            created_at: String::new(),
        }
    }

    #[test]
    fn renders_cards_escaped_and_without_admin_controls() {
        let vm = CatalogViewModel::new(vec![movie(1, "drama", ""), movie(2, "scifi", "")]);
        let html = index_page(&vm.render(), &vm.genres(), None);

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("Película &lt;1&gt;"));
        assert!(html.contains("login-form"));
        assert!(!html.contains("editar-pelicula"));
        assert!(!html.contains("pelicula-modal"));
        assert!(!html.contains("/css/styles.css"));
    }

    #[test]
    fn renders_admin_panel_and_trailer_for_admins() {
        let mut vm = CatalogViewModel::new(vec![movie(1, "drama", "https://youtu.be/sY1S34973zA")]);
        vm.login_succeeded();
        let detail = vm.detail(&vm.movies()[0]);
        let html = index_page(&vm.render(), &vm.genres(), Some(&detail));

        assert!(html.contains("admin-management"));
        assert!(html.contains("editar-pelicula"));
        assert!(html.contains("https://www.youtube.com/embed/sY1S34973zA"));
        assert!(html.contains("eliminar-pelicula-modal"));
        assert!(!html.contains("login-form"));
    }
}
