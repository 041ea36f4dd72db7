pub mod rand_num;
