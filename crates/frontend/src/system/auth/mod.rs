//! Bearer-token access. Login and refresh flows live outside this app;
//! the console only reads the token they leave in localStorage.

pub mod storage;
