mod loopback;
mod persistence;
mod tcp;
