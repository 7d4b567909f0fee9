//! Ping-pong between two kernel threads on the boot thread
//!
//! The boot thread alternates between `ping` and `pong` until both exit,
//! then prints their exit codes.
//!
//! # Environment Variables
//!
//! - `LKT_LOG_LEVEL=trace LKT_TRACE=1` - Log every initialize/switch/trampoline step
//! - `LKT_DUMP_THREADS=1` - Dump each thread's frame after initialization
//! - `LKT_STACK_SIZE=<bytes>` - Stack per thread (default 16 KB)
//! - `LKT_ROUNDS=<n>` - Round trips per thread (default 3)

use lkthread::{arch_thread_initialize, coop, env_get, kinfo, ContextConfig, CoopKernel, Thread};
use std::ptr::NonNull;
use std::sync::atomic::{AtomicUsize, Ordering};

// LKT_LOG_LEVEL=trace LKT_TRACE=1 cargo run -p lkthread-pingpong

static BOOT: AtomicUsize = AtomicUsize::new(0);

struct Player {
    label: &'static str,
    rounds: usize,
}

fn play(arg: usize) -> i32 {
    let player = unsafe { &*(arg as *const Player) };
    let boot = BOOT.load(Ordering::Relaxed) as *mut Thread;
    let Some(boot) = NonNull::new(boot) else {
        return -1;
    };

    for i in 0..player.rounds {
        println!("[{}] round {}", player.label, i);
        unsafe { coop::switch_to(boot) };
    }
    player.rounds as i32
}

fn main() {
    println!("=== lkthread ping-pong ===\n");

    let config = ContextConfig::from_env();
    config.apply();
    let rounds: usize = env_get("LKT_ROUNDS", 3);

    let mut boot = Box::new(Thread::bootstrap("bootstrap"));
    let boot_ptr = NonNull::from(&mut *boot);
    BOOT.store(boot_ptr.as_ptr() as usize, Ordering::Relaxed);
    CoopKernel::install(boot_ptr);

    let players = [
        Player { label: "ping", rounds },
        Player { label: "pong", rounds: rounds + 1 },
    ];

    let mut stacks: Vec<Vec<u128>> = players
        .iter()
        .map(|_| vec![0u128; config.stack_size / 16])
        .collect();

    let mut threads = Vec::new();
    for (player, stack) in players.iter().zip(stacks.iter_mut()) {
        let t = Thread::new(
            player.label,
            play,
            player as *const Player as usize,
            stack.as_mut_ptr().cast(),
            stack.len() * 16,
        );
        match t {
            Ok(mut t) => {
                arch_thread_initialize(&mut t);
                threads.push(Box::new(t));
            }
            Err(e) => {
                eprintln!("cannot create thread {}: {}", player.label, e);
                std::process::exit(1);
            }
        }
    }

    let mut live: Vec<NonNull<Thread>> =
        threads.iter_mut().map(|t| NonNull::from(&mut **t)).collect();

    while !live.is_empty() {
        live.retain(|&t| {
            unsafe { coop::switch_to(t) };
            match CoopKernel::take_exit() {
                Some((exited, code)) if exited == t => {
                    let name = unsafe { exited.as_ref().name().to_string() };
                    kinfo!("{} exited with {}", name, code);
                    println!("{} exited with {}", name, code);
                    false
                }
                _ => true,
            }
        });
    }

    CoopKernel::uninstall();
    println!("\nAll threads finished.");
}
