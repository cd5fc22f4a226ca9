mod container;
mod extract;
mod local;
