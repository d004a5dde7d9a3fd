// 集成测试共享辅助
#![allow(dead_code)]

pub mod dataset_fixture;
