// Resume upload/download: the binary is stored in and served straight from
// the database, held fully in memory per request.

pub mod handlers;
