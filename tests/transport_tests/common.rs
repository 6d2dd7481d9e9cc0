//! Fake image servers shared by the transport tests

#![allow(dead_code)]

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::mpsc::Receiver;
use std::thread::{self, JoinHandle};

pub const TRAILER: [u8; 3] = [23, 3, 4];

/// Read one request byte by byte until it ends with `trailer`
pub fn read_request(stream: &mut TcpStream, trailer: &[u8]) -> Vec<u8> {
    let mut request = Vec::new();
    let mut byte = [0u8; 1];
    while !request.ends_with(trailer) {
        match stream.read(&mut byte) {
            Ok(0) | Err(_) => break,
            Ok(_) => request.push(byte[0]),
        }
    }
    request
}

/// Bind an ephemeral port on loopback
pub fn bind() -> (TcpListener, u16) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    (listener, port)
}

/// Serve exactly one connection: read the request, write `response`, close
///
/// The join handle yields the raw request bytes.
pub fn one_shot_server(response: Vec<u8>) -> (u16, JoinHandle<Vec<u8>>) {
    one_shot_server_with_trailer(TRAILER.to_vec(), response)
}

/// [`one_shot_server`] for a non-default trailer
pub fn one_shot_server_with_trailer(trailer: Vec<u8>, response: Vec<u8>) -> (u16, JoinHandle<Vec<u8>>) {
    let (listener, port) = bind();
    let handle = thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let request = read_request(&mut stream, &trailer);
        stream.write_all(&response).unwrap();
        request
    });
    (port, handle)
}

/// Serve `count` connections concurrently, answering each with `respond(request)`
pub fn multi_server<F>(count: usize, respond: F) -> (u16, JoinHandle<()>)
where
    F: Fn(&[u8]) -> Vec<u8> + Send + Sync + 'static,
{
    let (listener, port) = bind();
    let respond = std::sync::Arc::new(respond);
    let handle = thread::spawn(move || {
        let mut workers = Vec::new();
        for _ in 0..count {
            let (mut stream, _) = listener.accept().unwrap();
            let respond = std::sync::Arc::clone(&respond);
            workers.push(thread::spawn(move || {
                let request = read_request(&mut stream, &TRAILER);
                stream.write_all(&respond(&request)).unwrap();
            }));
        }
        for worker in workers {
            worker.join().unwrap();
        }
    });
    (port, handle)
}

/// Accept one connection, read the request, then hold the socket open until
/// `release` fires
pub fn stalling_server(release: Receiver<()>) -> (u16, JoinHandle<()>) {
    let (listener, port) = bind();
    let handle = thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let _ = read_request(&mut stream, &TRAILER);
        let _ = release.recv();
        drop(stream);
    });
    (port, handle)
}
