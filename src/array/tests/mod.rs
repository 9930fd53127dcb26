mod foreach;
mod reduce;
