pub mod searx_server;
